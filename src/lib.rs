//! Workspace-level integration tests for poolbench live under `tests/`.
