use passbook_core::{
    CsvOptions, Era, EraConfig, EraTable, TransactionRecord, normalize_era_date, to_csv_bytes,
};

/// Offsets seen on real documents, including the disagreeing ones.
const OBSERVED: &[(&str, i32)] = &[
    ("meiji", 1867),
    ("taisho", 1911),
    ("showa", 1925),
    ("heisei", 1988),
    ("heisei", 1989),
    ("reiwa", 2018),
    ("reiwa", 2019),
];

#[test]
fn test_year_is_offset_plus_reign_year() {
    for (name, offset) in OBSERVED {
        let mut table = EraTable::japanese();
        assert!(table.set_offset(name, *offset));
        let cfg = EraConfig::implied(*name).with_table(table);

        for year in 1..=64u32 {
            let got = normalize_era_date(&format!("{}-7-4", year), &cfg);
            assert_eq!(got, format!("{}-07-04", offset + year as i32), "{} {}", name, year);
        }
    }
}

#[test]
fn test_custom_table_only() {
    let mut table = EraTable::new();
    table.insert(Era::new("fiscal", 1999).with_code(7));

    let implied = EraConfig::implied("fiscal").with_table(table.clone());
    assert_eq!(normalize_era_date("25-04-01", &implied), "2024-04-01");

    let coded = EraConfig::coded().with_table(table);
    assert_eq!(normalize_era_date("7-25-04-01", &coded), "2024-04-01");
    assert_eq!(normalize_era_date("5-06-06-28", &coded), "5-06-06-28");
}

#[test]
fn test_csv_reads_back_with_a_csv_reader() {
    let records = vec![TransactionRecord {
        date: "2023-06-28".to_string(),
        description: "振込 \"ヤマダ\"".to_string(),
        withdrawal: None,
        deposit: Some(1_234_567),
        balance: 2_000_000,
    }];
    let bytes = to_csv_bytes(&records, &CsvOptions::default()).unwrap();

    let mut rdr = csv::Reader::from_reader(&bytes[3..]);
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[0], "日付");
    assert_eq!(&headers[4], "残高");

    let row = rdr.records().next().unwrap().unwrap();
    assert_eq!(&row[1], "振込 \"ヤマダ\"");
    assert_eq!(&row[2], "");
    assert_eq!(&row[3], "1234567");
    assert_eq!(&row[4], "2000000");
}
