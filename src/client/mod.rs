//! Client side of the round workflow: round state, result submission, advancement and rankings,
//! over any [`MatchRepository`].

pub mod http;
pub mod local;
pub mod orchestrator;
pub mod rankings;
pub mod repository;
pub mod round_state;
pub mod submitter;

pub use http::HttpRepository;
pub use local::LocalRepository;
pub use orchestrator::{Advance, AdvanceError, RoundOrchestrator, INCOMPLETE_MESSAGE};
pub use rankings::{RankedPlayer, Rankings, RankingsPresenter, FETCH_ERROR_MESSAGE};
pub use repository::{MatchRepository, RepositoryError, RepositoryResult};
pub use round_state::{RoundState, SelectionError, Submission, SubmissionStatus};
