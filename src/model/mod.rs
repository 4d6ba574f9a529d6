pub mod api_gateway;
pub mod dnf_record;
pub mod progress_row;
pub mod race_result;
pub mod timing_result;
