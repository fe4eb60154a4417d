use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("window error: {0}")]
    Window(String),

    #[error("frame acquisition failed: {0}")]
    Acquisition(String),

    #[error("screenshot failed: {0}")]
    Screenshot(#[from] image::ImageError),

    #[error(transparent)]
    Config(#[from] hand_gesture::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
