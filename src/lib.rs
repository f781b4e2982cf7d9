//! Limeltl learns minimal Alternating Finite Automata from labeled example traces, using SAT solvers.

#![warn(missing_docs)]

pub mod afa;

pub mod encodings;

pub mod io;

pub mod learning;

pub mod sat;

pub mod traces;
