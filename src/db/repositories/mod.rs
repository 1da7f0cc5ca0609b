mod authorizations;
mod samples;
