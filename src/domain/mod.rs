// Domain layer - Core types and partition rules

pub mod model;
