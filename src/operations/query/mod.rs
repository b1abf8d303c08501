mod trace_strands;

pub use trace_strands::{Strand, TraceStrands};
