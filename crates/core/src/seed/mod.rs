//! Seed module - synthetic acquisition events for repairing import gaps.

mod seed_events;


pub use seed_events::load_seed_events;
