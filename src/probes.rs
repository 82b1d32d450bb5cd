use anyhow::{Result, bail};

/// Pure predicate over a probe's exit code and captured stdout.
/// A mismatch is an ordinary `Err`, never a panic.
pub type Validator = Box<dyn Fn(i64, &str) -> Result<()> + Send + Sync>;

/// One smoke test: a shell command run inside the container plus the
/// predicate its result must satisfy.
pub struct Probe {
    pub name: String,
    pub command: String,
    validator: Validator,
}

impl Probe {
    pub fn new(
        name: impl Into<String>,
        command: impl Into<String>,
        validator: Validator,
    ) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            validator,
        }
    }

    /// Standard probe: passes iff the command exits 0 and its stdout equals
    /// `expected` byte-for-byte, trailing newline included.
    pub fn exact(
        name: impl Into<String>,
        command: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        let expected = expected.into();
        let validator: Validator = Box::new(move |exit_code, stdout| {
            if exit_code != 0 {
                bail!("unexpected exit code: {exit_code}");
            }
            if stdout != expected {
                bail!("unexpected output: {stdout:?} (expected {expected:?})");
            }
            Ok(())
        });
        Self::new(name, command, validator)
    }

    /// Apply the probe's validator to a captured result.
    ///
    /// # Errors
    /// Returns the validator's failure reason when the result does not match.
    pub fn validate(&self, exit_code: i64, stdout: &str) -> Result<()> {
        (self.validator)(exit_code, stdout)
    }
}

/// Users provisioned by the image's db.json spec; each must be able to
/// authenticate with its password and run a trivial query.
pub const CREDENTIALS: &[(&str, &str)] = &[
    ("admin", "uFR44yr69C4mZa72g3JQ37GX"),
    ("app", "0Osh8bqE5EokT3I3Z78MQ344"),
    ("pgedge", "z1Zsku10a91RS526jnVrLC39"),
];

/// The full ordered probe set: baseline connectivity and extension checks,
/// then one connectivity probe per credential tuple. Ordering only affects
/// report readability; validators are independent.
#[must_use]
pub fn default_probes() -> Vec<Probe> {
    let mut probes = vec![
        Probe::exact(
            "pgedge can connect via PGPASS",
            "psql -U pgedge -t -A -d defaultdb -c 'SELECT 42'",
            "42\n",
        ),
        Probe::exact(
            "spock is installed",
            r#"psql -U pgedge -t -A -d defaultdb -c "SELECT count(*) FROM spock.subscription;""#,
            "0\n",
        ),
        Probe::exact(
            "LOLOR is installed",
            r#"psql -U pgedge -t -A -d defaultdb -c "SELECT lo_create (200000);;""#,
            "200000\n",
        ),
        Probe::exact(
            "pgvector can be installed",
            r#"psql -q -U pgedge -t -A -d defaultdb -c "CREATE EXTENSION vector; SELECT '[1, 2, 3]'::vector <-> '[4, 5, 6]'::vector;" 2>/dev/null"#,
            "5.196152422706632\n",
        ),
        Probe::exact(
            "postgis can be installed",
            r#"psql -q -U pgedge -t -A -d defaultdb -c "CREATE EXTENSION postgis; SELECT ST_Distance(ST_Point(1, 1), ST_Point(4, 5));" 2>/dev/null"#,
            "5\n",
        ),
    ];
    probes.extend(connectivity_probes(CREDENTIALS));
    probes
}

/// One "can connect" probe per credential tuple, each expecting `SELECT 1`
/// to succeed as that user.
#[must_use]
pub fn connectivity_probes(credentials: &[(&str, &str)]) -> Vec<Probe> {
    credentials
        .iter()
        .map(|(username, password)| {
            Probe::exact(
                format!("{username} can connect"),
                format!(
                    "PGPASSWORD={password} psql -U {username} -t -A -d defaultdb -c 'SELECT 1'"
                ),
                "1\n",
            )
        })
        .collect()
}
