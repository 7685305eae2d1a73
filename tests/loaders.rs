use anyhow::Result;
use shopflow::shoppers::loaders::{load, read_records, resolve_inputs};
use shopflow::shoppers::{HistoryRecord, OfferRecord};
use shopflow::testing::*;
use shopflow::*;
use std::fs;
use tempfile::TempDir;

const OFFERS_A: &str = "1197502,3203,1,106414464,0.75,13474\n1203052,9909,1,107127979,1,6732\n";
const OFFERS_B: &str = "1208251,2202,1,104460040,2,3718\n";

fn offers_dir() -> Result<TempDir> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("part-00000"), OFFERS_A)?;
    fs::write(dir.path().join("part-00001"), OFFERS_B)?;
    fs::write(dir.path().join("_SUCCESS"), "")?;
    fs::write(dir.path().join(".part-00000.crc"), "garbage")?;
    Ok(dir)
}

#[test]
fn reads_a_directory_of_parts_in_order() -> Result<()> {
    let dir = offers_dir()?;
    let files = resolve_inputs(dir.path())?;
    assert_eq!(files.len(), 2);
    assert!(files[0].ends_with("part-00000"));

    let offers = read_records::<OfferRecord>(dir.path())?;
    let ids: Vec<&str> = offers.iter().map(|o| o.offer_id.as_str()).collect();
    assert_eq!(ids, vec!["1197502", "1203052", "1208251"]);
    Ok(())
}

#[test]
fn reads_a_single_file_and_a_glob() -> Result<()> {
    let dir = offers_dir()?;
    let single = read_records::<OfferRecord>(dir.path().join("part-00001"))?;
    assert_eq!(single.len(), 1);

    let pattern = dir.path().join("part-*");
    assert_eq!(read_records::<OfferRecord>(&pattern)?.len(), 3);
    Ok(())
}

#[test]
fn missing_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = resolve_inputs(dir.path().join("nothing-here")).unwrap_err();
    assert!(err.to_string().contains("no input files"));
    assert!(resolve_inputs(dir.path()).is_err());
}

#[test]
fn malformed_line_fails_with_location() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("history.csv");
    fs::write(
        &path,
        "86246,205,1208251,34,5,t,2013-04-24\n86252,205,1197502,34,oops,t,2013-03-27\n",
    )?;

    let err = read_records::<HistoryRecord>(&path).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("history.csv:2"), "{msg}");
    assert!(msg.contains("repeattrips"), "{msg}");
    Ok(())
}

#[test]
fn load_attaches_a_source() -> Result<()> {
    let dir = offers_dir()?;
    let p = TestPipeline::new();
    let offers = load::<OfferRecord>(&p, dir.path())?;
    assert_eq!(p.node_count(), 1);

    let values = offers
        .map(|o: &OfferRecord| (o.offer_id.clone(), o.offervalue))
        .sort_by_key(false)
        .collect(&ExecutionContext::parallel().with_partitions(2))?;
    assert_eq!(
        values,
        vec![
            ("1197502".to_string(), 0.75),
            ("1203052".to_string(), 1.0),
            ("1208251".to_string(), 2.0)
        ]
    );
    Ok(())
}
