//! Location to country code resolution.
//!
//! Publisher locations are free text ("Montreal, Québec", "Washington, D.C.").
//! The last comma-separated part is folded to ASCII and looked up in the
//! override table, then ISO 3166 country names, then first-level
//! subdivisions of the countries that show up most in practice.

use crate::error::{ExtractError, Result};
use crate::models::CountryCode;
use crate::normalize::{normalize_punctuation, transliterate};
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use tracing::debug;

// ============================================================================
// REFERENCE DATA
// ============================================================================

/// Names that diverge from the ISO reference data.
const OVERRIDES: &[(&str, &str)] = &[
    ("Russia", "RU"),
    ("The Netherlands", "NL"),
    ("Holland", "NL"),
    ("UK", "GB"),
    ("U.K.", "GB"),
    ("Great Britain", "GB"),
    ("England", "GB"),
    ("Scotland", "GB"),
    ("Wales", "GB"),
    ("Northern Ireland", "GB"),
    ("USA", "US"),
    ("U.S.A.", "US"),
    ("US", "US"),
    ("U.S.", "US"),
    ("United States of America", "US"),
    ("D.C.", "US"),
    ("DC", "US"),
    ("South Korea", "KR"),
    ("Korea", "KR"),
    ("North Korea", "KP"),
    ("Czech Republic", "CZ"),
    ("Iran", "IR"),
    ("Syria", "SY"),
    ("Vietnam", "VN"),
    ("Laos", "LA"),
    ("Bolivia", "BO"),
    ("Venezuela", "VE"),
    ("Tanzania", "TZ"),
    ("Moldova", "MD"),
    ("Taiwan", "TW"),
    ("Palestine", "PS"),
    ("Micronesia", "FM"),
    ("Brunei", "BN"),
    ("Macau", "MO"),
    ("Macedonia", "MK"),
    ("Swaziland", "SZ"),
    ("Cape Verde", "CV"),
    ("Ivory Coast", "CI"),
    ("Burma", "MM"),
    ("Vatican", "VA"),
    ("Vatican City", "VA"),
    ("Turkiye", "TR"),
    ("Democratic Republic of the Congo", "CD"),
    ("DR Congo", "CD"),
    ("Republic of the Congo", "CG"),
    ("East Timor", "TL"),
    ("Kosovo", "XK"),
    ("Worldwide", "XW"),
];

/// ISO 3166-1 short names.
const COUNTRIES: &[(&str, &str)] = &[
    ("Afghanistan", "AF"), ("Åland Islands", "AX"), ("Albania", "AL"), ("Algeria", "DZ"),
    ("American Samoa", "AS"), ("Andorra", "AD"), ("Angola", "AO"), ("Anguilla", "AI"),
    ("Antarctica", "AQ"), ("Antigua and Barbuda", "AG"), ("Argentina", "AR"), ("Armenia", "AM"),
    ("Aruba", "AW"), ("Australia", "AU"), ("Austria", "AT"), ("Azerbaijan", "AZ"),
    ("Bahamas", "BS"), ("Bahrain", "BH"), ("Bangladesh", "BD"), ("Barbados", "BB"),
    ("Belarus", "BY"), ("Belgium", "BE"), ("Belize", "BZ"), ("Benin", "BJ"),
    ("Bermuda", "BM"), ("Bhutan", "BT"), ("Bosnia and Herzegovina", "BA"), ("Botswana", "BW"),
    ("Bouvet Island", "BV"), ("Brazil", "BR"), ("British Indian Ocean Territory", "IO"),
    ("Brunei Darussalam", "BN"), ("Bulgaria", "BG"), ("Burkina Faso", "BF"), ("Burundi", "BI"),
    ("Cabo Verde", "CV"), ("Cambodia", "KH"), ("Cameroon", "CM"), ("Canada", "CA"),
    ("Cayman Islands", "KY"), ("Central African Republic", "CF"), ("Chad", "TD"), ("Chile", "CL"),
    ("China", "CN"), ("Christmas Island", "CX"), ("Cocos (Keeling) Islands", "CC"),
    ("Colombia", "CO"), ("Comoros", "KM"), ("Congo", "CG"), ("Cook Islands", "CK"),
    ("Costa Rica", "CR"), ("Côte d'Ivoire", "CI"), ("Croatia", "HR"), ("Cuba", "CU"),
    ("Curaçao", "CW"), ("Cyprus", "CY"), ("Czechia", "CZ"), ("Denmark", "DK"),
    ("Djibouti", "DJ"), ("Dominica", "DM"), ("Dominican Republic", "DO"), ("Ecuador", "EC"),
    ("Egypt", "EG"), ("El Salvador", "SV"), ("Equatorial Guinea", "GQ"), ("Eritrea", "ER"),
    ("Estonia", "EE"), ("Eswatini", "SZ"), ("Ethiopia", "ET"), ("Falkland Islands (Malvinas)", "FK"),
    ("Faroe Islands", "FO"), ("Fiji", "FJ"), ("Finland", "FI"), ("France", "FR"),
    ("French Guiana", "GF"), ("French Polynesia", "PF"), ("French Southern Territories", "TF"),
    ("Gabon", "GA"), ("Gambia", "GM"), ("Georgia", "GE"), ("Germany", "DE"), ("Ghana", "GH"),
    ("Gibraltar", "GI"), ("Greece", "GR"), ("Greenland", "GL"), ("Grenada", "GD"),
    ("Guadeloupe", "GP"), ("Guam", "GU"), ("Guatemala", "GT"), ("Guernsey", "GG"),
    ("Guinea", "GN"), ("Guinea-Bissau", "GW"), ("Guyana", "GY"), ("Haiti", "HT"),
    ("Heard Island and McDonald Islands", "HM"), ("Holy See (Vatican City State)", "VA"),
    ("Honduras", "HN"), ("Hong Kong", "HK"), ("Hungary", "HU"), ("Iceland", "IS"),
    ("India", "IN"), ("Indonesia", "ID"), ("Iraq", "IQ"), ("Ireland", "IE"),
    ("Isle of Man", "IM"), ("Israel", "IL"), ("Italy", "IT"), ("Jamaica", "JM"),
    ("Japan", "JP"), ("Jersey", "JE"), ("Jordan", "JO"), ("Kazakhstan", "KZ"),
    ("Kenya", "KE"), ("Kiribati", "KI"), ("Kuwait", "KW"), ("Kyrgyzstan", "KG"),
    ("Lao People's Democratic Republic", "LA"), ("Latvia", "LV"), ("Lebanon", "LB"),
    ("Lesotho", "LS"), ("Liberia", "LR"), ("Libya", "LY"), ("Liechtenstein", "LI"),
    ("Lithuania", "LT"), ("Luxembourg", "LU"), ("Macao", "MO"), ("Madagascar", "MG"),
    ("Malawi", "MW"), ("Malaysia", "MY"), ("Maldives", "MV"), ("Mali", "ML"), ("Malta", "MT"),
    ("Marshall Islands", "MH"), ("Martinique", "MQ"), ("Mauritania", "MR"), ("Mauritius", "MU"),
    ("Mayotte", "YT"), ("Mexico", "MX"), ("Monaco", "MC"), ("Mongolia", "MN"),
    ("Montenegro", "ME"), ("Montserrat", "MS"), ("Morocco", "MA"), ("Mozambique", "MZ"),
    ("Myanmar", "MM"), ("Namibia", "NA"), ("Nauru", "NR"), ("Nepal", "NP"),
    ("Netherlands", "NL"), ("New Caledonia", "NC"), ("New Zealand", "NZ"), ("Nicaragua", "NI"),
    ("Niger", "NE"), ("Nigeria", "NG"), ("Niue", "NU"), ("Norfolk Island", "NF"),
    ("North Macedonia", "MK"), ("Northern Mariana Islands", "MP"), ("Norway", "NO"),
    ("Oman", "OM"), ("Pakistan", "PK"), ("Palau", "PW"), ("Panama", "PA"),
    ("Papua New Guinea", "PG"), ("Paraguay", "PY"), ("Peru", "PE"), ("Philippines", "PH"),
    ("Pitcairn", "PN"), ("Poland", "PL"), ("Portugal", "PT"), ("Puerto Rico", "PR"),
    ("Qatar", "QA"), ("Réunion", "RE"), ("Romania", "RO"), ("Russian Federation", "RU"),
    ("Rwanda", "RW"), ("Saint Barthélemy", "BL"), ("Saint Kitts and Nevis", "KN"),
    ("Saint Lucia", "LC"), ("Saint Martin (French part)", "MF"),
    ("Saint Pierre and Miquelon", "PM"), ("Saint Vincent and the Grenadines", "VC"),
    ("Samoa", "WS"), ("San Marino", "SM"), ("Sao Tome and Principe", "ST"),
    ("Saudi Arabia", "SA"), ("Senegal", "SN"), ("Serbia", "RS"), ("Seychelles", "SC"),
    ("Sierra Leone", "SL"), ("Singapore", "SG"), ("Sint Maarten (Dutch part)", "SX"),
    ("Slovakia", "SK"), ("Slovenia", "SI"), ("Solomon Islands", "SB"), ("Somalia", "SO"),
    ("South Africa", "ZA"), ("South Georgia and the South Sandwich Islands", "GS"),
    ("South Sudan", "SS"), ("Spain", "ES"), ("Sri Lanka", "LK"), ("Sudan", "SD"),
    ("Suriname", "SR"), ("Svalbard and Jan Mayen", "SJ"), ("Sweden", "SE"),
    ("Switzerland", "CH"), ("Syrian Arab Republic", "SY"), ("Tajikistan", "TJ"),
    ("Thailand", "TH"), ("Timor-Leste", "TL"), ("Togo", "TG"), ("Tokelau", "TK"),
    ("Tonga", "TO"), ("Trinidad and Tobago", "TT"), ("Tunisia", "TN"), ("Turkey", "TR"),
    ("Turkmenistan", "TM"), ("Turks and Caicos Islands", "TC"), ("Tuvalu", "TV"),
    ("Uganda", "UG"), ("Ukraine", "UA"), ("United Arab Emirates", "AE"),
    ("United Kingdom", "GB"), ("United States", "US"),
    ("United States Minor Outlying Islands", "UM"), ("Uruguay", "UY"), ("Uzbekistan", "UZ"),
    ("Vanuatu", "VU"), ("Viet Nam", "VN"), ("Wallis and Futuna", "WF"),
    ("Western Sahara", "EH"), ("Yemen", "YE"), ("Zambia", "ZM"), ("Zimbabwe", "ZW"),
];

/// First-level subdivisions mapped to their country.
const SUBDIVISIONS: &[(&str, &str)] = &[
    // United States
    ("Alabama", "US"), ("Alaska", "US"), ("Arizona", "US"), ("Arkansas", "US"),
    ("California", "US"), ("Colorado", "US"), ("Connecticut", "US"), ("Delaware", "US"),
    ("District of Columbia", "US"), ("Florida", "US"), ("Hawaii", "US"), ("Idaho", "US"),
    ("Illinois", "US"), ("Indiana", "US"), ("Iowa", "US"), ("Kansas", "US"),
    ("Kentucky", "US"), ("Louisiana", "US"), ("Maine", "US"), ("Maryland", "US"),
    ("Massachusetts", "US"), ("Michigan", "US"), ("Minnesota", "US"), ("Mississippi", "US"),
    ("Missouri", "US"), ("Montana", "US"), ("Nebraska", "US"), ("Nevada", "US"),
    ("New Hampshire", "US"), ("New Jersey", "US"), ("New Mexico", "US"), ("New York", "US"),
    ("North Carolina", "US"), ("North Dakota", "US"), ("Ohio", "US"), ("Oklahoma", "US"),
    ("Oregon", "US"), ("Pennsylvania", "US"), ("Rhode Island", "US"), ("South Carolina", "US"),
    ("South Dakota", "US"), ("Tennessee", "US"), ("Texas", "US"), ("Utah", "US"),
    ("Vermont", "US"), ("Virginia", "US"), ("Washington", "US"), ("West Virginia", "US"),
    ("Wisconsin", "US"), ("Wyoming", "US"),
    // Canada
    ("Alberta", "CA"), ("British Columbia", "CA"), ("Manitoba", "CA"), ("New Brunswick", "CA"),
    ("Newfoundland and Labrador", "CA"), ("Nova Scotia", "CA"), ("Ontario", "CA"),
    ("Prince Edward Island", "CA"), ("Quebec", "CA"), ("Saskatchewan", "CA"),
    ("Northwest Territories", "CA"), ("Nunavut", "CA"), ("Yukon", "CA"),
    // Australia
    ("New South Wales", "AU"), ("Victoria", "AU"), ("Queensland", "AU"),
    ("South Australia", "AU"), ("Western Australia", "AU"), ("Tasmania", "AU"),
    ("Northern Territory", "AU"), ("Australian Capital Territory", "AU"),
];

fn build_table(entries: &[(&str, &'static str)]) -> FxHashMap<String, &'static str> {
    entries
        .iter()
        .map(|(name, code)| (lookup_key(name), *code))
        .collect()
}

static OVERRIDE_TABLE: Lazy<FxHashMap<String, &'static str>> = Lazy::new(|| build_table(OVERRIDES));
static COUNTRY_TABLE: Lazy<FxHashMap<String, &'static str>> = Lazy::new(|| build_table(COUNTRIES));
static SUBDIVISION_TABLE: Lazy<FxHashMap<String, &'static str>> = Lazy::new(|| build_table(SUBDIVISIONS));

// ============================================================================
// LOOKUP
// ============================================================================

/// Fold a place name to its table key: ASCII, lowercase, no stray
/// punctuation around it. Periods inside ("St. Louis", "D.C.") are kept.
fn lookup_key(name: &str) -> String {
    let name = transliterate(&normalize_punctuation(name));
    name.trim_matches(|c: char| !c.is_alphanumeric() && c != '.' && c != ')')
        .to_lowercase()
}

/// The place name a location string refers to: "Seattle, Washington" → "Washington".
fn place_of(location: &str) -> &str {
    location.rsplit(", ").next().unwrap_or(location).trim()
}

/// Resolve a location, failing with `UnresolvableReference` when nothing matches.
pub fn lookup(location: &str) -> Result<CountryCode> {
    let place = place_of(location);
    let key = lookup_key(place);
    let keys = [key.clone(), key.trim_end_matches('.').to_string()];

    for table in [&*OVERRIDE_TABLE, &*COUNTRY_TABLE, &*SUBDIVISION_TABLE] {
        for key in keys.iter().filter(|k| !k.is_empty()) {
            if let Some(code) = table.get(key) {
                return Ok(CountryCode(*code));
            }
        }
    }
    Err(ExtractError::UnresolvableReference(format!("location '{}'", location)))
}

/// Resolve a location, falling back to `CountryCode::UNKNOWN`. Never fails.
pub fn resolve(location: Option<&str>) -> CountryCode {
    let Some(location) = location.filter(|l| !l.trim().is_empty()) else {
        return CountryCode::UNKNOWN;
    };
    let code = lookup(location).unwrap_or_else(|err| {
        debug!(%err, "country unresolved");
        CountryCode::UNKNOWN
    });
    if !code.is_unknown() {
        debug!(location, country = code.as_str(), "country resolved");
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_locations() {
        let cases = [
            ("Berlin, Germany", "DE"),
            ("Seattle, Washington", "US"),
            ("New York", "US"),
            ("Montreal, Québec", "CA"),
            ("Washington, D.C.", "US"),
            ("St. Louis, Missouri", "US"),
            ("Moscow, Russia", "RU"),
            ("Amsterdam, The Netherlands", "NL"),
            ("London, UK", "GB"),
            ("Seoul, South Korea", "KR"),
            ("Abidjan, Côte d\u{2019}Ivoire", "CI"),
            ("Melbourne, Victoria", "AU"),
            ("Köln, Germany.", "DE"),
        ];
        for (location, expected) in cases {
            assert_eq!(resolve(Some(location)), CountryCode(expected), "location: {}", location);
        }
    }

    #[test]
    fn test_unresolvable_is_unknown() {
        assert_eq!(resolve(Some("No, Ones Land")), CountryCode::UNKNOWN);
        assert_eq!(resolve(Some("")), CountryCode::UNKNOWN);
        assert_eq!(resolve(Some("   ")), CountryCode::UNKNOWN);
        assert_eq!(resolve(None), CountryCode::UNKNOWN);
        assert_eq!(resolve(Some("???")), CountryCode::UNKNOWN);
    }

    #[test]
    fn test_lookup_error() {
        assert!(matches!(
            lookup("Atlantis"),
            Err(ExtractError::UnresolvableReference(_))
        ));
    }

    #[test]
    fn test_tables_have_valid_codes() {
        for (name, code) in OVERRIDES.iter().chain(COUNTRIES).chain(SUBDIVISIONS) {
            assert_eq!(code.len(), 2, "{}", name);
            assert!(code.chars().all(|c| c.is_ascii_uppercase()), "{}", name);
        }
    }
}
