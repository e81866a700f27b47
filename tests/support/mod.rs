#![allow(dead_code)]

pub mod feedback_env;
pub mod issue_server;
