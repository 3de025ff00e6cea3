//! HTTP protocol layer module
//!
//! Response builders and form decoding, decoupled from the page logic.

pub mod form;
pub mod response;

// Re-export commonly used items
pub use form::form_value;
pub use response::{
    build_400_response, build_404_response, build_413_response, build_500_response,
    build_html_response, build_redirect_response,
};
