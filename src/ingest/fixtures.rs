///the input payloads, cfg(test) gated
///
/// Test fixtures: representative inputs for both converters.
///
/// The groundhog payload mirrors the groundhog-day.com API export:
///   groundhogs[]
///     .id, .slug, .name, ...   — scalar attributes
///     .predictions[]
///       .year          — integer
///       .shadow        — true = longer winter, false = early spring, null = unknown
///       .details       — free text
///
/// The climate payload is a slice of the NOAA nClimDiv fixed-width files:
///   SSDDEEYYYY followed by 12 monthly values, e.g.
///   0101270001  51.90 ...
///   SS = state, DD = division, EE = element code, YYYY = year

/// Two groundhogs, three predictions in total. Key order is significant:
/// it is what the derived CSV header must reproduce.
#[cfg(test)]
pub(crate) fn fixture_groundhogs_json() -> &'static str {
    r#"{
      "groundhogs": [
        {
          "id": 1,
          "slug": "punxsutawney-phil",
          "name": "Punxsutawney Phil",
          "region": "Pennsylvania",
          "isGroundhog": true,
          "predictions": [
            { "year": 1887, "shadow": true, "details": "First recorded prediction" },
            { "year": 2024, "shadow": false, "details": "" }
          ]
        },
        {
          "id": 2,
          "slug": "staten-island-chuck",
          "name": "Staten Island Chuck",
          "region": "New York",
          "isGroundhog": true,
          "predictions": [
            { "year": 2024, "shadow": null, "details": "Stayed in burrow" }
          ]
        }
      ]
    }"#
}

/// Second record is missing the `region` attribute the first one declares.
#[cfg(test)]
pub(crate) fn fixture_groundhogs_mismatched_json() -> &'static str {
    r#"{
      "groundhogs": [
        {
          "id": 1,
          "name": "Punxsutawney Phil",
          "region": "Pennsylvania",
          "predictions": [{ "year": 2024, "shadow": false }]
        },
        {
          "id": 2,
          "name": "Staten Island Chuck",
          "predictions": [{ "year": 2024, "shadow": true }]
        }
      ]
    }"#
}

/// Four Alabama division 01 maximum-temperature lines, 2001-2004.
#[cfg(test)]
pub(crate) fn fixture_climdiv_max_temp() -> &'static str {
    "0101270001  51.90  54.20  63.90  72.90  80.90  88.70  91.40  90.60  86.40  74.90  62.90  52.60
0101270002  52.10  55.20  63.10  73.10  81.30  89.30  91.50  90.80  86.80  75.40  62.20  53.50
0101270003  52.30  55.10  63.20  73.20  81.10  89.10  91.40  90.70  86.10  75.50  62.00  53.50
0101270004  52.10  54.90  62.30  73.00  81.40  89.00  91.10  90.90  85.30  75.10  61.80  53.20
"
}

/// One year across states and codes, listed out of sort order:
/// Arizona max, Alabama min, Alabama avg, Alabama division 02 max.
#[cfg(test)]
pub(crate) fn fixture_climdiv_mixed() -> &'static str {
    "0201271987  64.10  68.90  72.30  80.10  89.40  99.80 104.20 101.70  97.10  85.90  72.40  64.30
0101281987  33.10  36.00  42.20  48.90  57.80  65.60  69.40  68.70  63.50  50.10  41.90  36.40
0101021987  43.20  46.80  52.90  61.10  69.80  77.10  80.60  80.00  74.60  62.60  53.30  46.00
0102271987  54.40  57.90  64.00  73.50  82.00  88.90  92.10  91.60  86.70  75.80  66.10  57.30
"
}
