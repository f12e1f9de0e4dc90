pub mod common;
pub mod provider;
pub mod resolver;
pub mod web;

pub mod dto;
mod mapper;
