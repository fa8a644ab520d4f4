pub mod decimal_input_format;
pub mod time_utils;
