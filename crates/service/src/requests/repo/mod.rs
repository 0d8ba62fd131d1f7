pub mod seaorm;

pub use seaorm::SeaOrmRequestRepository;
