pub mod ai_provider;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod hint;
pub mod matcher;
pub mod rfp_reader;
pub mod stock_master;
pub mod tabular;
