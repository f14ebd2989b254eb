use crate::dtos::{Driver, DriverPayload};
use crate::error::ApiError;
use crate::form::{Draft, Editable, FieldSpec};
use crate::store::{Resource, UpdateVerb};

impl Resource for Driver {
    type Payload = DriverPayload;

    const COLLECTION: &'static str = "drivers";
    const LABEL: &'static str = "driver";
    const UPDATE_VERB: UpdateVerb = UpdateVerb::Put;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Editable for Driver {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("name", "Driver Name"),
        FieldSpec::required("license_number", "License Number"),
        FieldSpec::required("contact_info", "Contact Info"),
        FieldSpec::optional("assigned_truck_id", "Assigned Truck ID"),
    ];

    fn to_draft(&self) -> Draft {
        let mut draft = Draft::empty(Self::FIELDS);
        draft.insert("name", self.name.as_str());
        draft.insert("license_number", self.license_number.as_str());
        draft.insert("contact_info", self.contact_info.as_str());
        draft.insert(
            "assigned_truck_id",
            self.assigned_truck_id.map(|id| id.to_string()).unwrap_or_default(),
        );
        draft
    }

    fn payload_from(draft: &Draft) -> Result<DriverPayload, ApiError> {
        Ok(DriverPayload {
            name: draft.require("name")?.to_string(),
            license_number: draft.require("license_number")?.to_string(),
            contact_info: draft.require("contact_info")?.to_string(),
            assigned_truck_id: draft.optional_id("assigned_truck_id")?,
        })
    }
}
