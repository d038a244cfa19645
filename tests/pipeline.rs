use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook as XlsxWorkbook;
use rusty_table::batch::{convert_all_classes, convert_all_csv};
use rusty_table::error::{SchemaError, TableError, WorkbookError};
use rusty_table::{run, Config, CsvOptions, Mode, Spreadsheet, Workbook};
use std::fs;
use std::path::Path;

const PLAYER_SCHEMA: &[&[&str]] = &[
    &["ID", "Name"],
    &["int", "string"],
    &["c", "c"],
    &["", "Player name"],
];

fn write_workbook(path: &Path, sheets: &[(&str, &[&[&str]])]) {
    let mut workbook = XlsxWorkbook::new();
    for (name, rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).unwrap();
        for (row, cells) in rows.iter().enumerate() {
            for (column, cell) in cells.iter().enumerate() {
                if !cell.is_empty() {
                    sheet.write_string(row as u32, column as u16, *cell).unwrap();
                }
            }
        }
    }
    workbook.save(path).unwrap();
}

fn write_table(path: &Path, data: &[&[&str]], schema: &[&[&str]]) {
    write_workbook(path, &[("data", data), ("schema", schema)]);
}

#[test]
fn spreadsheet_rows_round_trip_through_calamine() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("Player.xlsx");
    write_table(&path, &[&["ID", "Name"], &["1", "Alice"], &["", "Bob"]], PLAYER_SCHEMA);

    let mut spreadsheet = Spreadsheet::open(&path).unwrap();

    assert_eq!(spreadsheet.sheet_names(), vec!["data", "schema"]);
    assert_eq!(
        spreadsheet.read_rows("data").unwrap(),
        vec![
            vec!["ID".to_owned(), "Name".to_owned()],
            vec!["1".to_owned(), "Alice".to_owned()],
            vec!["".to_owned(), "Bob".to_owned()],
        ]
    );
    assert_eq!(spreadsheet.read_rows("schema").unwrap()[3], vec!["".to_owned(), "Player name".to_owned()]);
}

#[test]
fn player_table_exports_csv_and_class() {
    let directory = tempfile::tempdir().unwrap();
    let input = directory.path().join("excel");
    fs::create_dir(&input).unwrap();
    write_table(&input.join("Player.xlsx"), &[&["ID", "Name"], &["1", "Alice"]], PLAYER_SCHEMA);
    let csv_dir = directory.path().join("csv");
    let class_dir = directory.path().join("cs");

    let csv = convert_all_csv(&input, &csv_dir, "xlsx", &CsvOptions::default()).unwrap();
    let classes = convert_all_classes(&input, &class_dir, "xlsx").unwrap();

    assert_eq!(csv.outputs, vec![csv_dir.join("Player.csv")]);
    assert_eq!(fs::read_to_string(csv_dir.join("Player.csv")).unwrap(), "1,Alice\n");

    assert_eq!(classes.outputs, vec!["T_Player".to_owned()]);
    let source = fs::read_to_string(class_dir.join("Player.cs")).unwrap();
    assert!(source.contains("\t\tpublic int ID { get; set; }\n"));
    assert!(source.contains("\t\t/// <summary>\n\t\t/// Player name\n\t\t/// </summary>\n\t\tpublic string Name { get; set; }\n"));

    let loader = fs::read_to_string(class_dir.join("TableDataLoader.cs")).unwrap();
    assert!(loader.contains("\t\t\ttasks.Add(T_Player.LoadAll(\"Player\"));\n"));
    assert!(loader.contains("\t\t\tawait Task.WhenAll(tasks);\n"));
}

#[test]
fn array_columns_generate_nested_records() {
    let directory = tempfile::tempdir().unwrap();
    let input = directory.path().join("excel");
    fs::create_dir(&input).unwrap();
    write_table(
        &input.join("Shop.xlsx"),
        &[&["ID", "Goods"], &["1", "(1,a);(2,b)"]],
        &[&["ID", "Goods"], &["int", "arr<int,stringslice>"], &["c", "c"], &["Key", "Goods on sale"]],
    );
    let csv_dir = directory.path().join("csv");
    let class_dir = directory.path().join("cs");

    convert_all_csv(&input, &csv_dir, "xlsx", &CsvOptions::default()).unwrap();
    convert_all_classes(&input, &class_dir, "xlsx").unwrap();

    assert_eq!(fs::read_to_string(csv_dir.join("Shop.csv")).unwrap(), "1,\"1,a;2,b\"\n");
    let source = fs::read_to_string(class_dir.join("Shop.cs")).unwrap();
    assert!(source.contains("\tpublic partial class T_Goods : ITable\n"));
    assert!(source.contains("\t\tpublic int Args0;\n"));
    assert!(source.contains("\t\tpublic List<string> Args1;\n"));
    assert!(source.contains("\t\t\tthis.Args0 = ConvertUtils.Get<int>(data[0]);\n"));
    assert!(source.contains("\t\t\tthis.Args1 = ConvertUtils.GetList<string>(data);\n"));
}

#[test]
fn bracket_option_wraps_groups() {
    let directory = tempfile::tempdir().unwrap();
    let input = directory.path().join("excel");
    fs::create_dir(&input).unwrap();
    write_table(
        &input.join("Drop.xlsx"),
        &[&["ID", "Items"], &["1", "1,2;3,4"]],
        &[&["ID", "Items"], &["int", "arr<int,int>"], &["c", "c"], &["Key", "Drops"]],
    );
    let csv_dir = directory.path().join("csv");

    convert_all_csv(&input, &csv_dir, "xlsx", &CsvOptions { add_bracket: true }).unwrap();

    assert_eq!(fs::read_to_string(csv_dir.join("Drop.csv")).unwrap(), "1,\"(1,2);(3,4)\"\n");
}

#[test]
fn bad_files_are_skipped_and_left_out_of_the_loader() {
    let directory = tempfile::tempdir().unwrap();
    let input = directory.path().join("excel");
    fs::create_dir(&input).unwrap();
    write_table(&input.join("Broken.xlsx"), &[&["ID"], &["1"]], &[&["ID"], &["int"]]);
    write_workbook(&input.join("Lonely.xlsx"), &[("data", &[&["ID"], &["1"]])]);
    write_table(&input.join("Player.xlsx"), &[&["ID", "Name"], &["1", "Alice"]], PLAYER_SCHEMA);
    let csv_dir = directory.path().join("csv");
    let class_dir = directory.path().join("cs");

    let csv = convert_all_csv(&input, &csv_dir, "xlsx", &CsvOptions::default()).unwrap();
    let classes = convert_all_classes(&input, &class_dir, "xlsx").unwrap();

    assert_eq!(csv.outputs, vec![csv_dir.join("Player.csv")]);
    assert_eq!(csv.failures.len(), 2);
    assert!(matches!(
        csv.failures[0].1,
        TableError::Schema(SchemaError::NotEnoughRows { required: 3, found: 2, .. })
    ));
    assert!(matches!(
        csv.failures[1].1,
        TableError::Workbook(WorkbookError::NotEnoughSheets { found: 1, .. })
    ));
    assert!(!csv_dir.join("Broken.csv").exists());

    assert_eq!(classes.outputs, vec!["T_Player".to_owned()]);
    assert!(!class_dir.join("Broken.cs").exists());
    assert!(!class_dir.join("Lonely.cs").exists());
    let loader = fs::read_to_string(class_dir.join("TableDataLoader.cs")).unwrap();
    assert!(!loader.contains("T_Broken"));
    assert!(!loader.contains("T_Lonely"));
}

#[test]
fn csv_rows_skip_header_and_blank_keys() {
    let directory = tempfile::tempdir().unwrap();
    let input = directory.path().join("excel");
    fs::create_dir(&input).unwrap();
    let data: &[&[&str]] = &[
        &["ID", "Name"],
        &["1", "Alice"],
        &["", "Orphan"],
        &["2", "Bob"],
        &[],
        &["3", ""],
    ];
    write_table(&input.join("Player.xlsx"), data, PLAYER_SCHEMA);
    let csv_dir = directory.path().join("csv");

    convert_all_csv(&input, &csv_dir, "xlsx", &CsvOptions::default()).unwrap();

    let csv = fs::read_to_string(csv_dir.join("Player.csv")).unwrap();
    assert_eq!(csv, "1,Alice\n2,Bob\n3,\n");
}

#[test]
fn csv_drops_excluded_columns_that_classes_keep() {
    let directory = tempfile::tempdir().unwrap();
    let input = directory.path().join("excel");
    fs::create_dir(&input).unwrap();
    write_table(
        &input.join("Npc.xlsx"),
        &[&["ID", "Hint", "Level"], &["7", "secret", "3"]],
        &[&["ID", "Hint", "Level"], &["int", "string", "int"], &["c", "cn", "s"], &["Key", "Hint", "Level"]],
    );
    let csv_dir = directory.path().join("csv");
    let class_dir = directory.path().join("cs");

    convert_all_csv(&input, &csv_dir, "xlsx", &CsvOptions::default()).unwrap();
    convert_all_classes(&input, &class_dir, "xlsx").unwrap();

    assert_eq!(fs::read_to_string(csv_dir.join("Npc.csv")).unwrap(), "7\n");
    let source = fs::read_to_string(class_dir.join("Npc.cs")).unwrap();
    assert!(source.contains("public string Hint { get; set; }"));
    assert!(!source.contains("Level"));
}

#[test]
fn run_produces_every_artifact() {
    let directory = tempfile::tempdir().unwrap();
    let input = directory.path().join("excel");
    fs::create_dir(&input).unwrap();
    write_table(&input.join("Item.xlsx"), &[&["ID", "Name"], &["1", "Sword"]], PLAYER_SCHEMA);
    write_table(&input.join("Player.xlsx"), &[&["ID", "Name"], &["1", "Alice"]], PLAYER_SCHEMA);
    let config = Config {
        input_dir: input,
        csv_dir: directory.path().join("out/csv"),
        class_dir: directory.path().join("out/cs"),
        mode: Mode::All,
        ..Config::default()
    };

    run(&config).unwrap();

    assert!(config.csv_dir.join("Item.csv").is_file());
    assert!(config.csv_dir.join("Player.csv").is_file());
    assert!(config.class_dir.join("Item.cs").is_file());
    assert!(config.class_dir.join("Player.cs").is_file());
    let loader = fs::read_to_string(config.class_dir.join("TableDataLoader.cs")).unwrap();
    let item = loader.find("T_Item.LoadAll(\"Item\")").unwrap();
    let player = loader.find("T_Player.LoadAll(\"Player\")").unwrap();
    assert!(item < player);
}

#[test]
fn run_in_all_mode_survives_empty_input() {
    let directory = tempfile::tempdir().unwrap();
    let input = directory.path().join("excel");
    fs::create_dir(&input).unwrap();
    let config = Config {
        input_dir: input,
        csv_dir: directory.path().join("csv"),
        class_dir: directory.path().join("cs"),
        mode: Mode::All,
        ..Config::default()
    };

    run(&config).unwrap();

    assert!(!config.class_dir.join("TableDataLoader.cs").exists());

    let csv_only = Config { mode: Mode::Csv, ..config };
    assert!(matches!(run(&csv_only), Err(TableError::NoInputFiles { .. })));
}

#[test]
fn loader_failure_keeps_generated_classes() {
    let directory = tempfile::tempdir().unwrap();
    let input = directory.path().join("excel");
    fs::create_dir(&input).unwrap();
    write_table(&input.join("Player.xlsx"), &[&["ID", "Name"], &["1", "Alice"]], PLAYER_SCHEMA);
    let class_dir = directory.path().join("cs");
    fs::create_dir_all(class_dir.join("TableDataLoader.cs")).unwrap();

    let report = convert_all_classes(&input, &class_dir, "xlsx").unwrap();

    assert_eq!(report.outputs, vec!["T_Player".to_owned()]);
    assert!(class_dir.join("Player.cs").is_file());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, class_dir);
    assert!(matches!(report.failures[0].1, TableError::Io(_)));
}

#[test]
fn computed_numbers_export_at_displayed_precision() {
    let directory = tempfile::tempdir().unwrap();
    let input = directory.path().join("excel");
    fs::create_dir(&input).unwrap();
    let path = input.join("Stats.xlsx");
    let mut workbook = XlsxWorkbook::new();
    let data = workbook.add_worksheet();
    data.set_name("data").unwrap();
    data.write_string(0, 0, "ID").unwrap();
    data.write_string(0, 1, "Rate").unwrap();
    data.write_number(1, 0, 1.0).unwrap();
    data.write_number(1, 1, 0.1 + 0.2).unwrap();
    let schema = workbook.add_worksheet();
    schema.set_name("schema").unwrap();
    for (row, cells) in [["ID", "Rate"], ["int", "float"], ["c", "c"]].iter().enumerate() {
        for (column, cell) in cells.iter().enumerate() {
            schema.write_string(row as u32, column as u16, *cell).unwrap();
        }
    }
    workbook.save(&path).unwrap();
    let csv_dir = directory.path().join("csv");

    convert_all_csv(&input, &csv_dir, "xlsx", &CsvOptions::default()).unwrap();

    assert_eq!(fs::read_to_string(csv_dir.join("Stats.csv")).unwrap(), "1,0.3\n");
}
