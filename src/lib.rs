#![allow(warnings)]

pub mod amount;
pub mod arguments;
pub mod assets;
pub mod commands;
pub mod configs;
pub mod constants;
pub mod engine;
pub mod errors; // Structured error taxonomy
pub mod events;
pub mod ledger; // Substrate traits + in-memory reference ledger
pub mod logger;
pub mod names;
pub mod paths;
pub mod payload;
pub mod registry;
pub mod router;
pub mod run;
pub mod swap;
pub mod translator;
