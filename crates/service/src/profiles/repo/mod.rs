pub mod seaorm;

pub use seaorm::SeaOrmProfileRepository;
