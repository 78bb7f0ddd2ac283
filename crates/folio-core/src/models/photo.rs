use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::constants::{PORTFOLIO_PHOTO_PREFIX, PROFILE_PHOTO_TYPE};
use crate::error::AppError;

/// Portfolio sections that accept their own photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortfolioPhotoType {
    Certification,
    Education,
    Internship,
    Project,
    Publication,
    Conference,
    Achievement,
    MedicalExperience,
    EngineeringExperience,
}

impl PortfolioPhotoType {
    pub const ALL: [PortfolioPhotoType; 9] = [
        PortfolioPhotoType::Certification,
        PortfolioPhotoType::Education,
        PortfolioPhotoType::Internship,
        PortfolioPhotoType::Project,
        PortfolioPhotoType::Publication,
        PortfolioPhotoType::Conference,
        PortfolioPhotoType::Achievement,
        PortfolioPhotoType::MedicalExperience,
        PortfolioPhotoType::EngineeringExperience,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PortfolioPhotoType::Certification => "certification",
            PortfolioPhotoType::Education => "education",
            PortfolioPhotoType::Internship => "internship",
            PortfolioPhotoType::Project => "project",
            PortfolioPhotoType::Publication => "publication",
            PortfolioPhotoType::Conference => "conference",
            PortfolioPhotoType::Achievement => "achievement",
            PortfolioPhotoType::MedicalExperience => "medical-experience",
            PortfolioPhotoType::EngineeringExperience => "engineering-experience",
        }
    }
}

impl FromStr for PortfolioPhotoType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PortfolioPhotoType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown portfolio photo type: {}", s)))
    }
}

impl Display for PortfolioPhotoType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// What an upload is for. Decides the photo type segment of the storage key
/// and whether the upload replaces an earlier file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoCategory {
    Profile,
    Portfolio(PortfolioPhotoType),
    Custom(String),
}

impl PhotoCategory {
    /// Free-form category from a single path segment of `[A-Za-z0-9_-]`.
    pub fn custom(path: &str) -> Result<Self, AppError> {
        let valid = !path.is_empty()
            && path.len() <= 64
            && path
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AppError::InvalidInput(format!(
                "Invalid upload path '{}': use letters, digits, '-' or '_'",
                path
            )));
        }
        Ok(PhotoCategory::Custom(path.to_string()))
    }

    /// Photo type segment used when generating the storage key.
    pub fn photo_type(&self) -> String {
        match self {
            PhotoCategory::Profile => PROFILE_PHOTO_TYPE.to_string(),
            PhotoCategory::Portfolio(kind) => format!("{}/{}", PORTFOLIO_PHOTO_PREFIX, kind),
            PhotoCategory::Custom(path) => path.clone(),
        }
    }

    /// Short label echoed back to clients.
    pub fn label(&self) -> &str {
        match self {
            PhotoCategory::Profile => PROFILE_PHOTO_TYPE,
            PhotoCategory::Portfolio(kind) => kind.as_str(),
            PhotoCategory::Custom(path) => path,
        }
    }

    /// Only the profile photo supersedes a previous upload; everything else is additive.
    pub fn replaces_existing(&self) -> bool {
        matches!(self, PhotoCategory::Profile)
    }
}
