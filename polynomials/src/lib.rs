pub mod multilinear_polynomial;
pub mod pool;
pub mod univariate_polynomial;

pub use multilinear_polynomial::evaluation_form::MultiLin;
pub use pool::BufferPool;
pub use univariate_polynomial::dense_coefficient_form::UnivariatePolynomial;
