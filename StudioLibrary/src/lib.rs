#![allow(non_snake_case)]

pub mod web;
pub mod utils;
pub mod studio;
