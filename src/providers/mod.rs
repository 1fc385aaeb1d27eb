mod flickr;
mod provider;

pub use flickr::FlickrProvider;
pub use provider::OAuthProvider;
