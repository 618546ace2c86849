pub mod title;

pub use title::{NewTitle, TitleId, TitleRecord, TitleResponse, TitleSummary};
