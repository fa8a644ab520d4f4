/// Number of attempts for a range whose failure is classified as transient.
pub const MAX_FETCH_ATTEMPTS: usize = 2;
