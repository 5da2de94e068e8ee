//! Template content for the generated build descriptor.

/// Template for `setup.py`.
/// Contains a {settings} placeholder for substitution
pub const SETUP_PY_TEMPLATE: &str = r#"# Automatically created by: eggpack

from setuptools import setup, find_packages

setup(
    name         = 'project',
    version      = '1.0',
    packages     = find_packages(),
    entry_points = {'scrapy': ['settings = {settings}']},
)
"#;
