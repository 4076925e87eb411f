/// User agent string sent with every request
pub const USER_AGENT: &str = concat!("frappe-client/", env!("CARGO_PKG_VERSION"));
/// Page size used by pagination when none (or zero) is given
pub const DEFAULT_PAGE_LENGTH: u64 = 100;
/// Path prefix shared by every API endpoint
pub const API_PREFIX: &str = "api";
/// Path segment for RPC-style calls, `/api/method/{method}`
pub const METHOD_SEGMENT: &str = "method";
/// Path segment for resource calls, `/api/resource/{doctype}[/{name}]`
pub const RESOURCE_SEGMENT: &str = "resource";
/// Method name of the login endpoint
pub const LOGIN_METHOD: &str = "login";
/// Cookie holding the server-side session id
pub const SESSION_ID_KEY: &str = "sid";
/// Query parameter carrying the list offset
pub const LIMIT_START_PARAM: &str = "limit_start";
/// Query parameter carrying the list page size
pub const LIMIT_PAGE_LENGTH_PARAM: &str = "limit_page_length";
/// Environment variable holding the site URL
pub const ENV_URL: &str = "FRAPPE_URL";
/// Environment variable holding the login user
pub const ENV_USERNAME: &str = "FRAPPE_USERNAME";
/// Environment variable holding the login password
pub const ENV_PASSWORD: &str = "FRAPPE_PASSWORD";
/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "FRAPPE_API_KEY";
/// Environment variable holding the API secret
pub const ENV_API_SECRET: &str = "FRAPPE_API_SECRET";
