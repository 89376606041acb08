use std::path::PathBuf;

pub use self::test_utils::TestCase;
use anyhow::Context;

mod test_utils;

pub fn read_test_case(name: &str) -> anyhow::Result<TestCase> {
    let path = if name.starts_with("tests") {
        PathBuf::from(name)
    } else {
        PathBuf::from("tests").join("cases").join(name)
    };
    let input = std::fs::read_to_string(&path)
        .with_context(|| format!("unable to read test case `{}`", path.display()))?;
    test_utils::parse_test_case(&input.replace("\r\n", "\n"))
        .with_context(|| format!("invalid test case `{}`", path.display()))
}

pub fn run_test_cases(dir: &str) -> anyhow::Result<()> {
    let dir = PathBuf::from("tests").join("cases").join(dir);
    let mut paths = std::fs::read_dir(&dir)?
        .map(|res| res.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.sort();

    for path in paths {
        let test_case = read_test_case(path.to_string_lossy().as_ref())?;
        test_case
            .run()
            .with_context(|| format!("Test case: {:?}", path))?;
    }

    Ok(())
}
