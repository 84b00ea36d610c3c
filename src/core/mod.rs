pub mod error;
pub mod form;
pub mod formatter;
pub mod job;
pub mod ops;
pub mod stage;
pub mod stats;
pub mod storage;
pub mod store;
pub mod tracker;
pub mod view;
