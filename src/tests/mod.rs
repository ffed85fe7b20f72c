// Integration-style test modules (unit tests live next to their code).

mod end_to_end;
