use super::*;

mod deduplication;
mod indexing;
mod opening;
