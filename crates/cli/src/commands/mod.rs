pub mod doctor;
pub mod generate;
pub mod init;
pub mod scenarios;
pub mod serve;
