//! ISO-3166-1 country code resolution. The gateway schema wants alpha-3
//! codes while checkout forms usually carry alpha-2 or a plain name.

const COUNTRIES: &[(&str, &str, &str)] = &[
    ("AD", "AND", "Andorra"),
    ("AE", "ARE", "United Arab Emirates"),
    ("AL", "ALB", "Albania"),
    ("AM", "ARM", "Armenia"),
    ("AR", "ARG", "Argentina"),
    ("AT", "AUT", "Austria"),
    ("AU", "AUS", "Australia"),
    ("AZ", "AZE", "Azerbaijan"),
    ("BA", "BIH", "Bosnia and Herzegovina"),
    ("BE", "BEL", "Belgium"),
    ("BG", "BGR", "Bulgaria"),
    ("BR", "BRA", "Brazil"),
    ("BY", "BLR", "Belarus"),
    ("CA", "CAN", "Canada"),
    ("CH", "CHE", "Switzerland"),
    ("CL", "CHL", "Chile"),
    ("CN", "CHN", "China"),
    ("CO", "COL", "Colombia"),
    ("CY", "CYP", "Cyprus"),
    ("CZ", "CZE", "Czechia"),
    ("DE", "DEU", "Germany"),
    ("DK", "DNK", "Denmark"),
    ("EE", "EST", "Estonia"),
    ("EG", "EGY", "Egypt"),
    ("ES", "ESP", "Spain"),
    ("FI", "FIN", "Finland"),
    ("FO", "FRO", "Faroe Islands"),
    ("FR", "FRA", "France"),
    ("GB", "GBR", "United Kingdom"),
    ("GE", "GEO", "Georgia"),
    ("GI", "GIB", "Gibraltar"),
    ("GL", "GRL", "Greenland"),
    ("GR", "GRC", "Greece"),
    ("HR", "HRV", "Croatia"),
    ("HU", "HUN", "Hungary"),
    ("ID", "IDN", "Indonesia"),
    ("IE", "IRL", "Ireland"),
    ("IL", "ISR", "Israel"),
    ("IN", "IND", "India"),
    ("IS", "ISL", "Iceland"),
    ("IT", "ITA", "Italy"),
    ("JP", "JPN", "Japan"),
    ("KR", "KOR", "South Korea"),
    ("LI", "LIE", "Liechtenstein"),
    ("LT", "LTU", "Lithuania"),
    ("LU", "LUX", "Luxembourg"),
    ("LV", "LVA", "Latvia"),
    ("MC", "MCO", "Monaco"),
    ("MD", "MDA", "Moldova"),
    ("ME", "MNE", "Montenegro"),
    ("MK", "MKD", "North Macedonia"),
    ("MT", "MLT", "Malta"),
    ("MX", "MEX", "Mexico"),
    ("NL", "NLD", "Netherlands"),
    ("NO", "NOR", "Norway"),
    ("NZ", "NZL", "New Zealand"),
    ("PL", "POL", "Poland"),
    ("PT", "PRT", "Portugal"),
    ("RO", "ROU", "Romania"),
    ("RS", "SRB", "Serbia"),
    ("RU", "RUS", "Russia"),
    ("SA", "SAU", "Saudi Arabia"),
    ("SE", "SWE", "Sweden"),
    ("SG", "SGP", "Singapore"),
    ("SI", "SVN", "Slovenia"),
    ("SK", "SVK", "Slovakia"),
    ("SM", "SMR", "San Marino"),
    ("TR", "TUR", "Turkey"),
    ("UA", "UKR", "Ukraine"),
    ("US", "USA", "United States"),
    ("VA", "VAT", "Holy See"),
    ("ZA", "ZAF", "South Africa"),
];

/// Resolves an alpha-2 code, alpha-3 code or English short name to the
/// ISO-3166-1 alpha-3 code. Returns `None` when no mapping exists; the
/// caller emits an empty attribute in that case.
pub fn country_alpha3(value: &str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.len() == 2 {
        return COUNTRIES
            .iter()
            .find(|(alpha2, _, _)| alpha2.eq_ignore_ascii_case(trimmed))
            .map(|(_, alpha3, _)| *alpha3);
    }

    if trimmed.len() == 3 {
        if let Some(known) = COUNTRIES
            .iter()
            .find(|(_, alpha3, _)| alpha3.eq_ignore_ascii_case(trimmed))
        {
            return Some(known.1);
        }
    }

    COUNTRIES
        .iter()
        .find(|(_, _, name)| name.eq_ignore_ascii_case(trimmed))
        .map(|(_, alpha3, _)| *alpha3)
}
