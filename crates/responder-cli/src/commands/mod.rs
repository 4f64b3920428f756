pub mod make;
pub mod publish;
