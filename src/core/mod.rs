// Copyright @yucwang 2021

pub mod computation_node;
pub mod config_loader;
pub mod rng;
pub mod transfer_function;
