//! Section and Property rules.

use nx_core::units;
use nx_model::{PropertyRecord, SectionRecord};

use crate::finding::{ErrorKind, Finding};

pub fn check_section(section: &SectionRecord) -> Vec<Finding> {
    check_identity(section.name.as_deref(), section.type_name.as_deref())
}

/// A Property has no type of its own; it is checked for name, unit and
/// value consistency.
pub fn check_property(prop: &PropertyRecord) -> Vec<Finding> {
    let mut findings = Vec::new();

    if is_blank(prop.name.as_deref()) {
        findings.push(ErrorKind::NoName.into());
    }

    let unit = prop.unit.as_deref().filter(|u| !u.trim().is_empty());
    match unit {
        None if prop.values.iter().any(|v| v.is_numeric()) => {
            findings.push(ErrorKind::PropertyUnitNotSet.into());
        }
        Some(unit) if !units::is_valid(unit) => {
            findings.push(ErrorKind::PropertyUnitInvalid.into());
        }
        _ => {}
    }

    if let Some(first) = prop.values.first() {
        let dtype = first.data_type();
        if prop.values.iter().any(|v| v.data_type() != dtype) {
            findings.push(ErrorKind::PropertyValuesInconsistent.into());
        }
    }

    if let Some(odml_type) = prop.odml_type {
        if !prop.values.iter().all(|v| odml_type.compatible(v)) {
            findings.push(ErrorKind::OdmlTypeIncompatible(odml_type).into());
        }
    }

    findings
}

/// `NoName` then `NoType`, each when the attribute is absent or empty.
pub(crate) fn check_identity(name: Option<&str>, type_name: Option<&str>) -> Vec<Finding> {
    let mut findings = Vec::new();
    if is_blank(name) {
        findings.push(ErrorKind::NoName.into());
    }
    if is_blank(type_name) {
        findings.push(ErrorKind::NoType.into());
    }
    findings
}

fn is_blank(attr: Option<&str>) -> bool {
    attr.is_none_or(str::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nx_model::{OdmlType, Value};

    fn property(unit: Option<&str>, values: Vec<Value>) -> PropertyRecord {
        PropertyRecord {
            name: Some("sampling-rate".into()),
            unit: unit.map(str::to_string),
            odml_type: None,
            values,
        }
    }

    #[test]
    fn identity_rules() {
        assert_eq!(
            check_identity(None, Some("")),
            vec![
                Finding::Error(ErrorKind::NoName),
                Finding::Error(ErrorKind::NoType)
            ]
        );
        assert!(check_identity(Some("a"), Some("b")).is_empty());

        let section = SectionRecord {
            name: Some("recording".into()),
            ..SectionRecord::default()
        };
        assert_eq!(
            check_section(&section),
            vec![Finding::Error(ErrorKind::NoType)]
        );
    }

    #[test]
    fn numeric_values_need_a_unit() {
        let p = property(None, vec![Value::Float(20.0)]);
        assert_eq!(
            check_property(&p),
            vec![Finding::Error(ErrorKind::PropertyUnitNotSet)]
        );
        assert!(check_property(&property(Some("kHz"), vec![Value::Float(20.0)])).is_empty());
        assert!(check_property(&property(None, vec![Value::Text("J. Doe".into())])).is_empty());
        assert!(check_property(&property(None, vec![])).is_empty());
    }

    #[test]
    fn invalid_unit() {
        let p = property(Some("furlongs"), vec![Value::Float(1.0)]);
        assert_eq!(
            check_property(&p),
            vec![Finding::Error(ErrorKind::PropertyUnitInvalid)]
        );
        assert!(check_property(&property(Some("mV/s"), vec![Value::Int(3)])).is_empty());
    }

    #[test]
    fn mixed_values_and_odml_type() {
        let mut p = property(Some("Hz"), vec![Value::Int(1), Value::Float(2.0)]);
        p.odml_type = Some(OdmlType::Float);
        assert_eq!(
            check_property(&p),
            vec![
                Finding::Error(ErrorKind::PropertyValuesInconsistent),
                Finding::Error(ErrorKind::OdmlTypeIncompatible(OdmlType::Float))
            ]
        );

        let person = PropertyRecord {
            name: Some("experimenter".into()),
            odml_type: Some(OdmlType::Person),
            values: vec![Value::Text("J. Doe".into())],
            ..PropertyRecord::default()
        };
        assert!(check_property(&person).is_empty());
    }

    #[test]
    fn unnamed_property() {
        let p = PropertyRecord::default();
        assert_eq!(check_property(&p), vec![Finding::Error(ErrorKind::NoName)]);
    }
}
