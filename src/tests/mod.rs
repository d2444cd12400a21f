//! Test suite.

mod draft;
mod nested;
mod order;
mod vector;
