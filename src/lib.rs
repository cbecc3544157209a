pub mod boundary;
pub mod brute_force;
pub mod challenge;
pub mod config;
pub mod generator;
pub mod map;
pub mod pathfinding;
pub mod report;
pub mod search;
pub mod solvers;
pub mod targets;
pub mod zobrist;
