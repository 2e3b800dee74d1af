pub mod usaco_parser;
pub mod probgate_parser;

pub use probgate_parser::ProbgateParser;
pub use usaco_parser::UsacoParser;
