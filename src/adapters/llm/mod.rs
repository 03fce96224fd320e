//! Language model adapters.

mod mock;
mod openai_compat;

pub use mock::{MockError, MockLanguageModel, MockResponse};
pub use openai_compat::{OpenAiCompatConfig, OpenAiCompatProvider};
