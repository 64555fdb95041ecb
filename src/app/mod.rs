// Presentation side: label tables and report rendering. Domain enums stay text-free.

pub mod labels;
pub mod report;
