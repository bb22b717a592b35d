//! Admin crop master: the crop and variety rows offered by the catchment
//! request form.

use serde::{Deserialize, Serialize};

use super::demographics::Crop;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CropMasterError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Crop ID may only contain letters, digits, '-' and '_'")]
    CropId,
}

/// Row typed into the add-crop form. Names are kept upper-case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCrop {
    pub crop_name: String,
    pub crop_id: String,
    #[serde(default)]
    pub variety_name: String,
    #[serde(default)]
    pub variety_id: String,
}

impl NewCrop {
    pub fn validate(&self) -> Result<(), CropMasterError> {
        if self.crop_name.trim().is_empty() {
            return Err(CropMasterError::Required("Crop name"));
        }
        let crop_id = self.crop_id.trim();
        if crop_id.is_empty() {
            return Err(CropMasterError::Required("Crop ID"));
        }
        if !crop_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(CropMasterError::CropId);
        }
        if !self.variety_name.trim().is_empty() && self.variety_id.trim().is_empty() {
            return Err(CropMasterError::Required("Variety ID"));
        }
        Ok(())
    }

    pub fn into_crop(self) -> Crop {
        let filled = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };
        Crop {
            crop_id: self.crop_id.trim().to_string(),
            crop_name: filled(&self.crop_name).map(|n| n.to_uppercase()),
            crop_variety_id: filled(&self.variety_id),
            crop_variety_name: filled(&self.variety_name).map(|n| n.to_uppercase()),
        }
    }

    /// Body of `POST /admin/crops`.
    pub fn to_form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("crop_name", self.crop_name.trim().to_string()),
            ("crop_id", self.crop_id.trim().to_string()),
            ("variety_name", self.variety_name.trim().to_string()),
            ("variety_id", self.variety_id.trim().to_string()),
        ]
    }
}

/// Answer of the crop master endpoints: the full list after the change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CropMasterResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub crops: Vec<Crop>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> NewCrop {
        NewCrop {
            crop_name: " Sunflower ".into(),
            crop_id: "C006".into(),
            variety_name: "kbsh-44".into(),
            variety_id: "CV006".into(),
        }
    }

    #[test]
    fn test_names_are_upper_cased() {
        let crop = form().into_crop();
        assert_eq!(crop.crop_id, "C006");
        assert_eq!(crop.crop_name.as_deref(), Some("SUNFLOWER"));
        assert_eq!(crop.crop_variety_name.as_deref(), Some("KBSH-44"));
    }

    #[test]
    fn test_variety_is_optional() {
        let crop = NewCrop {
            variety_name: String::new(),
            variety_id: String::new(),
            ..form()
        };
        assert!(crop.validate().is_ok());
        let crop = crop.into_crop();
        assert_eq!(crop.crop_variety_id, None);
        assert_eq!(crop.to_option().linked.map(|l| l.id), Some("NA".to_string()));
    }

    #[test]
    fn test_validation() {
        let missing = NewCrop {
            crop_id: " ".into(),
            ..form()
        };
        assert_eq!(missing.validate(), Err(CropMasterError::Required("Crop ID")));
        let spaced = NewCrop {
            crop_id: "C 6".into(),
            ..form()
        };
        assert_eq!(spaced.validate(), Err(CropMasterError::CropId));
        let no_variety_id = NewCrop {
            variety_id: String::new(),
            ..form()
        };
        assert_eq!(
            no_variety_id.validate().unwrap_err().to_string(),
            "Variety ID is required"
        );
    }
}
