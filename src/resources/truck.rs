use crate::dtos::{Truck, TruckPayload, TruckStatus};
use crate::error::ApiError;
use crate::form::{Draft, Editable, FieldSpec};
use crate::store::{Resource, UpdateVerb};

impl Resource for Truck {
    type Payload = TruckPayload;

    const COLLECTION: &'static str = "trucks";
    const LABEL: &'static str = "truck";
    const UPDATE_VERB: UpdateVerb = UpdateVerb::Put;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Editable for Truck {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("plate_number", "Plate Number"),
        FieldSpec::required("model", "Model"),
        FieldSpec::required("status", "Status").with_default("Available"),
        FieldSpec::optional("current_driver_id", "Current Driver ID"),
    ];

    fn to_draft(&self) -> Draft {
        let mut draft = Draft::empty(Self::FIELDS);
        draft.insert("plate_number", self.plate_number.as_str());
        draft.insert("model", self.model.as_str());
        draft.insert("status", self.status.as_str());
        draft.insert(
            "current_driver_id",
            self.current_driver_id.map(|id| id.to_string()).unwrap_or_default(),
        );
        draft
    }

    fn payload_from(draft: &Draft) -> Result<TruckPayload, ApiError> {
        let status = draft
            .require("status")?
            .parse::<TruckStatus>()
            .map_err(ApiError::Validation)?;
        Ok(TruckPayload {
            plate_number: draft.require("plate_number")?.to_string(),
            model: draft.require("model")?.to_string(),
            status,
            current_driver_id: draft.optional_id("current_driver_id")?,
        })
    }
}
