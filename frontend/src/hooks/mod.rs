pub mod use_front_desk;
pub mod use_injury_form;
pub mod use_reference_data;
