/// Constants module to avoid magic numbers in the codebase

// Prediction service
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:5001";
pub const DEFAULT_CHAT_PATH: &str = "/chat";
pub const DEFAULT_IMAGE_PATH: &str = "/predict_image";
pub const DEFAULT_IMAGE_FIELD: &str = "file";
pub const STATUS_CHECK_TIMEOUT_SECS: u64 = 3;

// Confidence policy (inclusive on the pass side)
pub const CONFIDENCE_THRESHOLD: f64 = 70.0;

// User-facing strings
pub const TEXT_LOW_CONFIDENCE_DISCLAIMER: &str =
    "I'm not confident enough to assess your symptoms. Please consult a dermatologist.";
pub const IMAGE_LOW_CONFIDENCE_DISCLAIMER: &str =
    "I'm not confident enough to diagnose this image. Please consult a dermatologist.";
pub const CONNECTIVITY_FAILURE_MESSAGE: &str =
    "Unable to reach the prediction service. Please try again later.";
pub const ERROR_MARKER: &str = "Error";
pub const EMPTY_MESSAGE_PROMPT: &str = "Please describe your symptoms first.";
pub const MISSING_IMAGE_PROMPT: &str = "Please select an image to upload.";
pub const NO_PREDICTION_NOTICE: &str = "The prediction service returned no prediction.";

// Suggested symptom descriptions offered next to the input line
pub const PRESET_PROMPTS: &[&str] = &[
    "I have a red, itchy rash on my arms that gets worse at night.",
    "There are small white bumps around my eyes that don't hurt.",
    "My face has persistent redness and small visible blood vessels.",
    "I have a painful, blistering rash on one side of my torso.",
    "The skin between my toes is cracked, peeling and itchy.",
    "I have thick, scaly silver patches on my elbows and knees.",
];

// UI Configuration
pub const UI_REFRESH_INTERVAL_MS: u64 = 50;
pub const UI_SCROLL_LINES: u16 = 3;
pub const UI_EVENT_CHANNEL_CAPACITY: usize = 32;
