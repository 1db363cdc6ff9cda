mod sms_service;

pub use sms_service::*;
