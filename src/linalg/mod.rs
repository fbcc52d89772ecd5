pub mod etree;
pub mod options;
pub mod reach;
pub mod solver;
pub mod triangular;
