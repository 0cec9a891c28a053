//! Logs known out of the box.

use perch_log::LogConfig;
use perch_types::LogFormat;

/// Public firmware and module logs, used when the config lists none.
pub fn builtin_logs() -> Vec<LogConfig> {
    vec![
        LogConfig::new(
            "https://api.transparency.dev/armored-witness-firmware/prod/log/1/",
            "transparency.dev/armored-witness/firmware_transparency/prod/1",
            "transparency.dev-aw-ftlog-prod-1+3e6d87ee+Aa3qdhefd2cc/98jV3blslJT2L+iFR8WKHeGcgFmyjnt",
            LogFormat::Serverless,
        ),
        LogConfig::new(
            "https://api.transparency.dev/armored-witness-firmware/ci/log/4/",
            "transparency.dev/armored-witness/firmware_transparency/ci/4",
            "transparency.dev-aw-ftlog-ci-4+30fe79e3+AUDoas+smwQDTlYbTzbEcAW+N6WyvB/4CysMWjpnRgat",
            LogFormat::Serverless,
        ),
        LogConfig::new(
            "https://raw.githubusercontent.com/f-secure-foundry/armory-drive-log/master/log/",
            "Armory Drive Prod 2",
            "armory-drive-log+16541b8f+AYDPmG5pQp4Bgu0a1mr5uDZ196+t8lIVIfWQSPWmP+Jv",
            LogFormat::Serverless,
        ),
        LogConfig::new(
            "https://fwupd.org/ftlog/lvfs/",
            "lvfs",
            "lvfs+7908d142+ASnlGgOh+634tcE/2Lp3wV7k/cLoU6ncawmb/BLC1oMU",
            LogFormat::Serverless,
        ),
        LogConfig::new(
            "https://sum.golang.org/",
            "go.sum database tree",
            "sum.golang.org+033de0ae+Ac4zctda0e5eza+HJyk9SxEdh+s3Ux18htTTAD8OuAn8",
            LogFormat::SumDb,
        ),
    ]
}
