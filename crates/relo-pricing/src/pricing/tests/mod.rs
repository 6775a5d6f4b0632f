mod common;

mod base_price;
mod estimator;
mod rules;
