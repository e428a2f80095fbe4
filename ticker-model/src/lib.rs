//! Demo item model for the ticker: headline identities, the headline item
//! itself and a fixed sample feed.
#![allow(missing_docs)]

pub mod feed;
pub mod headline;
pub mod ids;

pub use feed::sample_headlines;
pub use headline::Headline;
pub use ids::ItemId;
