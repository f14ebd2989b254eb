use crate::dtos::timestamp;
use crate::dtos::{Assignment, AssignmentPayload, AssignmentStatus};
use crate::error::ApiError;
use crate::form::{Draft, Editable, FieldSpec};
use crate::store::{Resource, UpdateVerb};

impl Resource for Assignment {
    type Payload = AssignmentPayload;

    const COLLECTION: &'static str = "assignments";
    const LABEL: &'static str = "assignment";
    const UPDATE_VERB: UpdateVerb = UpdateVerb::Patch;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Editable for Assignment {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("driver_id", "Driver ID"),
        FieldSpec::required("truck_id", "Truck ID"),
        FieldSpec::required("start_date", "Start Date"),
        FieldSpec::optional("end_date", "End Date"),
        FieldSpec::required("status", "Status").with_default("Pending"),
    ];

    fn to_draft(&self) -> Draft {
        let mut draft = Draft::empty(Self::FIELDS);
        draft.insert("driver_id", self.driver_id.to_string());
        draft.insert("truck_id", self.truck_id.to_string());
        draft.insert("start_date", timestamp::format_input(&self.start_date));
        draft.insert(
            "end_date",
            self.end_date.as_ref().map(timestamp::format_input).unwrap_or_default(),
        );
        draft.insert("status", self.status.as_str());
        draft
    }

    fn payload_from(draft: &Draft) -> Result<AssignmentPayload, ApiError> {
        let start_date = parse_date("start_date", draft.require("start_date")?)?;
        let end_date = draft
            .optional("end_date")
            .map(|raw| parse_date("end_date", raw))
            .transpose()?;
        let status = draft
            .require("status")?
            .parse::<AssignmentStatus>()
            .map_err(ApiError::Validation)?;

        Ok(AssignmentPayload {
            driver_id: draft.require_id("driver_id")?,
            truck_id: draft.require_id("truck_id")?,
            start_date,
            end_date,
            status,
        })
    }
}

fn parse_date(name: &str, raw: &str) -> Result<chrono::NaiveDateTime, ApiError> {
    timestamp::parse(raw)
        .ok_or_else(|| ApiError::validation(format!("{name} must look like 2025-01-31T08:00, got {raw:?}")))
}
