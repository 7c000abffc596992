//! Composition of the engine components over the external stores.

pub mod pricer;

pub use pricer::{
    DealContext, DealEvaluation, DealIssue, DealPricer, PricingError, SidePricing,
};
