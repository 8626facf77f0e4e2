mod buckets;
mod delete_file;
mod get_files;
mod upload_file;

pub use buckets::{
    BucketValues, CreateBucket, CreateBucketHandler, CreateBucketResponse, DeleteBucket,
    DeleteBucketHandler, DeleteBucketResponse, GetBuckets, GetBucketsHandler, GetBucketsResponse,
    UpdateBucket, UpdateBucketHandler, UpdateBucketResponse,
};
pub use delete_file::{DeleteFile, DeleteFileHandler, DeleteFileResponse};
pub use get_files::{GetFiles, GetFilesHandler, GetFilesResponse};
pub use upload_file::{UploadFile, UploadFileHandler, UploadFileResponse};
