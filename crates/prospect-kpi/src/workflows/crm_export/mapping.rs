use super::normalizer::normalize_header;
use crate::workflows::prospecting::Field;
use std::collections::HashMap;
use std::sync::OnceLock;

static HEADER_FIELD_MAP: OnceLock<HashMap<String, Field>> = OnceLock::new();

pub(crate) fn field_for_header(header: &str) -> Option<Field> {
    header_field_map().get(&normalize_header(header)).copied()
}

fn header_field_map() -> &'static HashMap<String, Field> {
    HEADER_FIELD_MAP.get_or_init(|| {
        const HEADER_TO_FIELD: &[(&str, Field)] = &[
            // Aircall
            ("Last Aircall call timestamp", Field::CallTimestamp),
            ("Last call timestamp", Field::CallTimestamp),
            ("Last used Aircall tags", Field::CallTags),
            ("Last call tags", Field::CallTags),
            // lemlist
            ("lemlist lead status", Field::EmailLeadStatus),
            ("Lead status", Field::EmailLeadStatus),
            // HubSpot lifecycle and activity
            ("Phase du cycle de vie", Field::LifecyclePhase),
            ("Lifecycle stage", Field::LifecyclePhase),
            ("Lifecycle phase", Field::LifecyclePhase),
            ("Date de la dernière activité", Field::LastActivityDate),
            ("Last activity date", Field::LastActivityDate),
            // Segmentation
            ("Campagne", Field::Campaign),
            ("Campaign", Field::Campaign),
            ("Intitulé du poste", Field::JobTitle),
            ("Job title", Field::JobTitle),
            ("Secteur", Field::Sector),
            ("Sector", Field::Sector),
            ("Industry", Field::Sector),
            ("Taille d'entreprise", Field::CompanySize),
            ("Taille d\u{2019}entreprise", Field::CompanySize),
            ("Company size", Field::CompanySize),
            ("Localisation", Field::Location),
            ("Location", Field::Location),
        ];

        let mut map = HashMap::with_capacity(HEADER_TO_FIELD.len());
        for (header, field) in HEADER_TO_FIELD {
            map.insert(normalize_header(header), *field);
        }
        map
    })
}
