pub mod dense_coefficient_form;
