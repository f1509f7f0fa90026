pub mod naver;

pub use naver::NaverNewsClient;
