//! Plot title composition.

/// One patient's reconciled demographics, as read off the first row of the
/// patient's group. `None` covers absent columns, empty values, and
/// non-numeric ages alike.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientDemographics {
    pub gender: Option<String>,
    pub age: Option<f64>,
    pub hospital: Option<String>,
}

impl PatientDemographics {
    fn is_blank(&self) -> bool {
        self.gender.is_none() && self.age.is_none() && self.hospital.is_none()
    }
}

/// Compose a chart title.
///
/// With no demographics at all the title is `"<patient_id> <analyte>"`.
/// Otherwise the parenthetical lists gender (space-suffixed), the
/// rounded-down age as `"<age> yr "`, and the hospital; missing fields are
/// simply omitted.
pub fn compose_title(patient_id: &str, demographics: &PatientDemographics, analyte: &str) -> String {
    if demographics.is_blank() {
        return format!("{patient_id} {analyte}");
    }
    let mut info = String::new();
    if let Some(gender) = demographics.gender.as_deref() {
        info.push_str(gender.trim());
        info.push(' ');
    }
    if let Some(age) = demographics.age {
        info.push_str(&format!("{} yr ", age.floor() as i64));
    }
    if let Some(hospital) = demographics.hospital.as_deref() {
        info.push_str(hospital.trim());
    }
    format!("{patient_id}({info}) {analyte}")
}
