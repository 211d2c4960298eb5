//! Conversation state: transcript, active persona and generation parameters.

mod message;
mod params;
mod store;

pub use message::{Message, Role};
pub use params::{
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P, MAX_TOKENS_RANGE, ParamSnapshot,
    ParameterSet, TEMPERATURE_RANGE, TOP_P_RANGE, max_tokens_range_error,
};
pub use store::{NO_RESPONSE, SessionStore};
